fn main() -> anyhow::Result<()> {
    rankmer::cli::run::entry()
}
