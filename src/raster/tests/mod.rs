pub(crate) mod test_utils;
mod collection_tests;
