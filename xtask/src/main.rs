fn execute(dir: &str, args: &[&str]) {
    let cmd = &args[0];
    let cmd_full = args.join(" ");
    eprintln!("Running '{}'", cmd_full);
    let status = match std::process::Command::new(cmd)
        .current_dir(dir)
        .args(&args[1..])
        .status()
    {
        Ok(status) => status,
        Err(err) => {
            eprintln!("Could not start command '{}': {}", cmd_full, err);
            std::process::exit(1);
        }
    };

    if !status.success() {
        eprintln!("Command '{}' terminated with a non-0 exit code", cmd_full);
        std::process::exit(1);
    }
    eprintln!("Finished: '{}'", cmd_full);
}

fn demo_build() {
    execute(
        "./",
        &[
            "cargo",
            "build",
            "-p",
            "hearth_demo",
            "--target",
            "wasm32-unknown-unknown",
        ],
    );
    execute(
        "./",
        &[
            "wasm-bindgen",
            "--target",
            "web",
            "--no-typescript",
            "--out-dir",
            "hearth_demo/pkg",
            "./target/wasm32-unknown-unknown/debug/hearth_demo.wasm",
        ],
    )
}

fn demo_serve() {
    execute(
        "./",
        &[
            "cargo",
            "watch",
            "-w",
            "hearth_demo/src",
            "-w",
            "hearth/src",
            "-s",
            "cargo xtask demo-build",
        ],
    );
}

fn web_test() {
    execute(
        "./",
        &["wasm-pack", "test", "--headless", "--firefox", "hearth"],
    );
}

fn main() {
    let args: Vec<_> = std::env::args().skip(1).collect();
    let arg_refs: Vec<_> = args.iter().map(|x| x.as_str()).collect();

    match arg_refs.as_slice() {
        &["demo-build"] => {
            demo_build();
        }
        &["demo-serve"] => {
            demo_serve();
        }
        &["web-test"] => {
            web_test();
        }
        _ => {
            eprintln!("Unknown arguments, expected one of: demo-build, demo-serve, web-test");
            std::process::exit(1);
        }
    }
}
