fn main() -> anyhow::Result<()> {
    cleansea_lib::run()
}
