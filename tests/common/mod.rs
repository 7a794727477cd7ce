pub mod synthetic_data;
