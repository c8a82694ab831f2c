fn main() {
    std::process::exit(effz_cli::run_from_env());
}
