pub mod assertions;
pub mod builder;
pub mod fixtures;
pub mod mock;

pub use assertions::CallAssertions;
pub use builder::MockTransportBuilder;
pub use fixtures::{token_abi, uint64_result, AbiBuilder, FieldType};
pub use mock::{MockRegistry, MockTransport, RecordedCall};
