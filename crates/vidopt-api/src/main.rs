use vidopt_core::Config;

// Use mimalloc as the global allocator; transcoding runs allocate and free large
// buffers concurrently.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Missing required variables abort startup with a non-zero exit.
    let config = Config::from_env()?;

    let (_state, router) = vidopt_api::setup::initialize_app(config.clone()).await?;

    vidopt_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
