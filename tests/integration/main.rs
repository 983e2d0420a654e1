//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific behaviour of
//! the station against mock adapters.  All tests run on the host (x86_64)
//! with no real hardware required.

mod fill_cycle_tests;
mod mock_hw;
mod reset_tests;
mod volume_tests;
