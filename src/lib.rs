//! # chatloop - Interactive Language Model Chat
//!
//! `chatloop` is a command-line chat loop over a pretrained causal language
//! model. The model is hosted by an OpenAI-compatible completion server
//! (vLLM, llama.cpp, Ollama, TGI); `chatloop` loads a handle to it once,
//! then sends every line you type as a prompt and prints the reply.
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve a model, then chat with it
//! vllm serve NousResearch/Llama-2-7b-chat-hf
//! chatloop
//!
//! # Pick a different server and model
//! chatloop --endpoint http://gpu-box:8000 --model mistralai/Mistral-7B-v0.1
//!
//! # Pipe a script of prompts
//! printf 'What is OSPF?\nexit\n' | chatloop
//! ```
//!
//! Type `exit` (any case) to leave. End of input does the same.
//!
//! ## Configuration
//!
//! Settings are read from `~/.config/chatloop/config.toml`:
//!
//! ```toml
//! [chatloop]
//! provider = "local"
//! model = "NousResearch/Llama-2-7b-chat-hf"
//!
//! [generation]
//! max_length = 200
//! sampling = "stochastic"
//!
//! [providers.local]
//! endpoint = "http://localhost:8000"
//! models = ["NousResearch/Llama-2-7b-chat-hf"]
//! ```

/// Interactive chat loop.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// Generation engine trait and OpenAI-compatible backend.
pub mod engine;

/// Diagnostic logging setup.
pub mod logging;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Terminal UI components (spinner, colors).
pub mod ui;
