//! # Provider Configuration
//!
//! Loads the YAML file that says which API entities become Terraform
//! resources and data sources, and how their operations map onto HTTP.
//!
//! Loading runs in four steps, and every failure surfaces as
//! [`GenError::ConfigValidation`](crate::error::GenError::ConfigValidation)
//! before anything is planned or written:
//!
//! 1. YAML decode into a `serde_json::Value` (order preserving)
//! 2. JSON-Schema validation against the embedded `provider_schema.json`
//! 3. Typed decode into [`ProviderConfiguration`]
//! 4. Semantic checks: URI syntax, HTTP method tokens, base paths, and a
//!    resolved method for every operation the generated code calls
//!
//! ```yaml
//! global:
//!   uri: https://petstore.example/api
//!   create_method: POST
//!   read_method: GET
//!   update_method: PUT
//!   destroy_method: DELETE
//!   id_attribute: id
//! resources:
//!   pet:
//!     path: /pet
//!   order:
//!     path: /store/order
//!     force_recreate: true
//! ```

mod load;
mod types;

pub use load::{load_provider_config, parse_provider_config};
pub use types::{
    EntityDescriptor, GeneratorSettings, OAuthClientCredentials, OperationOverride, PropertySource,
    ProviderConfiguration, ProviderDefaults, ProviderSettings, SearchSettings,
};
