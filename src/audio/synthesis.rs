//! Procedural soundtrack configuration.

/// Glicol composition (procedural music code)
///
/// The sine bass pulse carries the low bands that drive the cloud radius;
/// the square chime line keeps energy up in the bands that drive velocity.
pub const GLICOL_COMPOSITION: &str = r#"
~gate: speed 2.4 >> seq 48 _48 _~n 36
~n: choose 48 48 60 72 0 0
~amp: ~gate >> envperc 0.002 0.25
~pit: ~gate >> mul 130.81
~bass: sin ~pit >> mul ~amp >> mul 0.4
~tick: speed 9.6 >> seq 96 _ 96 96
~tamp: ~tick >> envperc 0.001 0.02
~tpit: ~tick >> mul 523.25
~chime: squ ~tpit >> mul ~tamp >> lpf 9500.0 1.0 >> mul 0.08
o: ~bass >> add ~chime >> plate 0.12
"#;
