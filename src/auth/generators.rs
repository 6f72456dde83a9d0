use async_trait::async_trait;
use petname::Generator;

/// Trait for generating guest display names
#[async_trait]
pub trait DisplayNameGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Pet name-based display name generator
pub struct PetNameGenerator;

impl PetNameGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PetNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DisplayNameGenerator for PetNameGenerator {
    async fn generate(&self) -> String {
        petname::Petnames::default()
            .generate_one(2, "-")
            .expect("default petname word lists are non-empty")
    }
}
