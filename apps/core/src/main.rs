fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match devtools_showcase_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[devtools-showcase] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = devtools_showcase_core::runtime::run_with_options(options) {
        eprintln!("[devtools-showcase] runtime failed: {error}");
        std::process::exit(1);
    }
}
