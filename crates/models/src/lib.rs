pub mod errors;
pub mod db;
pub mod user;
pub mod property;

#[cfg(test)]
mod tests;
