//! Reading the parameter registry before any network is selected is a
//! programming error and must be fatal. Kept in its own binary so no other
//! test can have selected a network in this process first.

use doge_consensus::chainparams::params;

#[test]
#[should_panic(expected = "before select")]
fn test_params_before_select_panics() {
    let _ = params();
}
