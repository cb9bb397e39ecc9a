use aliri_braid::braid;

/// BrainSTEM user's username.
#[braid(serde)]
pub struct Username;
