pub mod domain;
pub mod ports;

pub use domain::{
    short_id, Certification, Education, Experience, Language, LanguageProficiency, Link, LinkType,
    Project, Resume, ResumeElement, Skill, SkillLevel,
};
pub use ports::{
    ChatRole, ChatStream, ChatTurn, ContentEditorService, ConversationLog, DocumentStore,
    PortError, PortResult, SupervisorService,
};
