mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from inkgenius for tests
pub use inkgenius::models::{Message, Sender};
pub use inkgenius::{
    Artist, Contract, ContractStatus, DesignBrief, ModelSet, Project, ProjectRepository, StudioDb,
    TattooService, TattooStyle,
};
