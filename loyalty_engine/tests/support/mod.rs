#![allow(dead_code)]
pub mod mock_accrual;
pub mod prepare_env;
