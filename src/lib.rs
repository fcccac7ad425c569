//! EditSync: an editing backend that forwards text to a language model under
//! a fixed set of operation prompts, gates access behind a login, and serves
//! marketing content from a headless CMS.

pub mod auth;
pub mod banner;
pub mod cms;
pub mod completion;
pub mod config;
pub mod consts;
pub mod dispatcher;
pub mod history;
pub mod prompts;
pub mod server;
