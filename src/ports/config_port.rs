//! Configuration access port trait.
//!
//! Typed getters distinguish a missing key (`Ok(None)`) from a present key
//! whose value does not parse (`Err`).

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String>;
    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, String>;
}
