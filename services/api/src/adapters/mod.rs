pub mod conversation;
pub mod editor_llm;
pub mod store;
pub mod supervisor_llm;

pub use conversation::InMemoryConversationLog;
pub use editor_llm::OpenAiEditorAdapter;
pub use store::FsDocumentStore;
pub use supervisor_llm::OpenAiSupervisorAdapter;
