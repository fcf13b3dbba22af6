use smartlink_frame::{MAX_FRAME_SIZE, MAX_MODULES, MAX_PAYLOAD_SIZE};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("smartlink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: smartlink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("SMARTLINK_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "protocol: max_payload={MAX_PAYLOAD_SIZE} max_frame={MAX_FRAME_SIZE} max_modules={MAX_MODULES}"
    );
    println!(
        "features: serde={}, async={}, cli=true",
        cfg!(feature = "serde"),
        cfg!(feature = "async")
    );

    Ok(SUCCESS)
}
