// Chat Completions wire types come from async-openai.
pub use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest as ChatCompletionRequest,
    CreateChatCompletionRequestArgs as ChatCompletionRequestArgs,
    CreateChatCompletionResponse as ChatCompletionResponse,
};
