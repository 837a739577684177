pub mod llm;
pub mod intake; // Conversational intake engine
