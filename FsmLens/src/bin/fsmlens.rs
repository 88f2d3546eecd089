fn main() -> anyhow::Result<()> {
    fsmlens::cli::run_cli()
}
