fn main() -> anyhow::Result<()> {
    juliaenv::run_cli()
}
