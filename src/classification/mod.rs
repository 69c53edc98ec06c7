pub mod category_map;
pub mod error;
pub mod verdict;

#[cfg(test)]
mod tests;
