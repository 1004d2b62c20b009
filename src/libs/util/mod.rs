pub mod logging;
pub mod util;
pub mod version;

#[cfg(test)]
pub mod test_util;
