use std::{fs, path::PathBuf, process::Command};

fn check_program(name: &str, install_hint: &str) {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => {}
        _ => {
            eprintln!("error: `{name}` not found. Install it:");
            eprintln!("  {install_hint}");
            std::process::exit(1);
        }
    }
}

fn main() {
    check_program(
        "pkg-config",
        "sudo apt install pkg-config  # Ubuntu/Debian",
    );

    let ui_dir = PathBuf::from("data/resources/ui");
    for entry in fs::read_dir(&ui_dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "ui") {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }

    println!("cargo:rerun-if-changed=data/resources/resources.gresource.xml");
    println!("cargo:rerun-if-changed=data/resources/style.css");

    glib_build_tools::compile_resources(
        &["data/resources"],
        "data/resources/resources.gresource.xml",
        "devconfig.gresource",
    );
}
