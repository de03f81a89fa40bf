use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use panel_provisioner::app::lambda::{handle_event, LambdaRequest, LambdaResponse};
use panel_provisioner::core::ConfigProvider;
use panel_provisioner::utils::{logger, validation::Validate};
use panel_provisioner::{PanelConfig, Provisioner, PterodactylClient};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = PanelConfig::from_env()?;
    logger::init_logger(&config.logging, false);

    config.validate()?;
    tracing::info!("Panel provisioner lambda targeting {}", config.api_base());

    let client = PterodactylClient::from_config(&config)?;
    let provisioner = Provisioner::new(client, config.server_template());
    let shared = &provisioner;

    run(service_fn(move |event: LambdaEvent<LambdaRequest>| async move {
        Ok::<LambdaResponse, Error>(handle_event(shared, event.payload).await)
    }))
    .await
}
