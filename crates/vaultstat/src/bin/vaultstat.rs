fn main() {
    if let Err(err) = vaultstat::run() {
        eprintln!("{}", vaultstat::format_error(&err));
        std::process::exit(1);
    }
}
