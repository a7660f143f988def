//! Reference data configuration
//!
//! The lists the batch generator samples from. Defaults give a usable demo
//! out of the box.

use serde::Deserialize;

/// Reference lists for generated messages
///
/// # Example
///
/// ```toml
/// [reference]
/// names = ["Asha", "Ravi", "Meera"]
/// origins = ["Mumbai", "Pune"]
/// destinations = ["Delhi", "Chennai"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Candidate names
    pub names: Vec<String>,

    /// Candidate origins
    pub origins: Vec<String>,

    /// Candidate destinations
    pub destinations: Vec<String>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            names: vec![
                "Asha".to_string(),
                "Ravi".to_string(),
                "Meera".to_string(),
                "Karan".to_string(),
                "Divya".to_string(),
                "Nikhil".to_string(),
                "Priya".to_string(),
                "Sanjay".to_string(),
            ],
            origins: vec![
                "Mumbai".to_string(),
                "Pune".to_string(),
                "Bengaluru".to_string(),
                "Hyderabad".to_string(),
                "Kolkata".to_string(),
            ],
            destinations: vec![
                "Delhi".to_string(),
                "Chennai".to_string(),
                "Jaipur".to_string(),
                "Lucknow".to_string(),
                "Ahmedabad".to_string(),
            ],
        }
    }
}
