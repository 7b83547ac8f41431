pub mod docs;
pub mod entry;
pub mod native;
pub mod provision;

#[cfg(test)]
pub mod fixtures;
