//! Marker types.

/// Marker type describing a vehicle entering the parking lot.
#[derive(Clone, Copy, Debug)]
pub struct Entry;

/// Marker type describing a vehicle leaving the parking lot.
#[derive(Clone, Copy, Debug)]
pub struct Exit;
