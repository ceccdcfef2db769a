mod core;
pub use self::core::{
    BoxedToolCall, Function, FunctionCall, FunctionCallFn, Message, Parameters, Property, Role,
    ToolCall, ToolType, completion,
};

mod chat;
pub use chat::chat;
