pub mod csv_adapter;
pub mod csv_order_log;
pub mod file_config_adapter;
pub mod paper_broker;
