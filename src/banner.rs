//! Startup banner.

use std::net::SocketAddr;

use crate::consts::{AUTHOR, HOMEPAGE, REPO};

/// Server configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub addr: SocketAddr,
    pub provider: &'a str,
    pub model: &'a str,
    pub api_key: &'a str,
    pub login: &'a str,
    pub content: &'a str,
    pub history: &'a str,
}

/// Render the startup banner.
pub fn render_banner(info: &BannerInfo) -> String {
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║           E D I T S Y N C             ║
   ║        find. replace. sync.           ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   listen    http://{}
   provider  {} ({})
   api key   {}
   login     {}
   content   {}
   history   {}
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.addr,
        info.provider,
        info.model,
        info.api_key,
        info.login,
        info.content,
        info.history,
    )
}

/// Print the startup banner with server info.
pub fn print_banner(info: &BannerInfo) {
    println!("{}", render_banner(info));
}
