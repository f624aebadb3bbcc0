#[cfg(test)]
mod discovery;
#[cfg(test)]
mod scanning;
pub mod utils;
