//! Integration test suite for the shipway CLI

mod helpers;
mod test_dispatch;
mod test_release;
