use clap::{Arg, Command, arg, crate_version, value_parser};
use std::path::PathBuf;

pub fn cli() -> Command {
    Command::new("wlscan")
        .about("TUI for scanning and joining WiFi networks using NetworkManager")
        .version(crate_version!())
        .arg(
            arg!(--config <path>)
                .short('c')
                .required(false)
                .help("Path to the config file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("join-mode")
                .long("join-mode")
                .short('j')
                .value_name("mode")
                .required(false)
                .help("Join networks by BSSID or by SSID")
                .value_parser(["bssid", "ssid"]),
        )
}
