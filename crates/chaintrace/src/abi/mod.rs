mod abi;
pub use abi::{
    AbiActionDefinition, AbiDefinition, AbiFieldDefinition, AbiStructDefinition,
    AbiTypeDefinition,
};
