//! Cross-module scenarios
//!
//! Unit tests live next to the code they cover; these exercise the geometry
//! kernel and the light pipeline together.
