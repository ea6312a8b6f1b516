pub mod put_parallel;
pub mod put_serial;
