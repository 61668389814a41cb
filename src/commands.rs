use anyhow::{Context as _, Result};
use dotenv::dotenv;
use log::{info, warn};
use poise::serenity_prelude as serenity;
use serenity::builder::{CreateAttachment, CreateMessage};

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use roulette_sim::chart::SvgSurface;
use roulette_sim::config::{config_path, ConfigData};
use roulette_sim::error::SimError;
use roulette_sim::io::{LogSink, SimulationRequest, TextSummary};
use roulette_sim::roulette::Roulette;
use roulette_sim::simulation::SimulationReport;

type Context<'a> = poise::Context<'a, Data, anyhow::Error>;

pub struct Data {
    pub config: Arc<RwLock<ConfigData>>,
    pub config_path: PathBuf,
}

impl Data {
    async fn new(config_path: PathBuf) -> Result<Self> {
        let config = ConfigData::load(&config_path).await?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    async fn save_config(&self) -> Result<()> {
        let config = self.config.read().await;
        config.save(&self.config_path).await
    }
}

struct Finished {
    report: SimulationReport,
    summary: String,
    chart: String,
}

/// Runs the whole simulation synchronously so nothing non-Send lives across
/// an await point.
fn run_request(config: &ConfigData, request: &SimulationRequest) -> Result<Finished> {
    let mut summary = TextSummary::default();
    let mut surface = SvgSurface::new(config.chart.width, config.chart.height);
    let (_, report) = roulette_sim::run(
        request,
        rand::thread_rng(),
        &mut [&mut summary, &mut LogSink],
        &mut surface,
        &config.chart.style,
    )?;
    Ok(Finished {
        report,
        summary: summary.text(),
        chart: surface.to_svg(),
    })
}

/// Simulates even-money roulette bets and charts the balance
#[poise::command(slash_command, prefix_command)]
async fn simulate(
    ctx: Context<'_>,
    #[description = "Starting balance"] starting_balance: Option<i64>,
    #[description = "Base bet amount"] bet_amount: Option<i64>,
    #[description = "flat or martingale"] strategy: Option<String>,
    #[description = "Maximum number of rounds"] rounds: Option<i64>,
    #[description = "red, black, odd or even"] bet_choice: Option<String>,
    #[description = "End the run at the first win"] stop_on_first_win: Option<bool>,
) -> Result<()> {
    let config = ctx.data().config.read().await.clone();
    let request = SimulationRequest {
        starting_balance,
        bet_amount,
        strategy,
        rounds,
        bet_choice,
        stop_on_first_win,
        ..SimulationRequest::from_config(&config)
    };

    let finished = match run_request(&config, &request) {
        Ok(finished) => finished,
        Err(e) if e.downcast_ref::<SimError>().is_some() => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("Invalid input: {}", e))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let reply = poise::CreateReply::default()
        .content(&finished.summary)
        .attachment(CreateAttachment::bytes(
            finished.chart.into_bytes(),
            "balance.svg",
        ));
    ctx.send(reply).await?;

    // Mirror the result to the log channel
    if let Some(log_channel_id) = config.log_channel {
        let content = format!(
            "{} ran a simulation ({} rounds, net {:+}):\n{}",
            ctx.author().name,
            finished.report.rounds_played,
            finished.report.net(),
            finished.summary
        );
        let channel_id = serenity::ChannelId::new(log_channel_id);
        if let Err(why) = channel_id
            .send_message(
                &ctx.serenity_context().http,
                CreateMessage::new().content(content),
            )
            .await
        {
            warn!("Could not post to log channel {}: {:?}", log_channel_id, why);
        }
    }

    Ok(())
}

/// Spins the wheel once
#[poise::command(slash_command, prefix_command)]
async fn spin(ctx: Context<'_>) -> Result<()> {
    let spin = Roulette::new(rand::thread_rng()).spin();
    ctx.say(format!("The ball lands on {} ({})", spin.number, spin.outcome))
        .await?;
    Ok(())
}

#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
async fn set_log_channel(
    ctx: poise::ApplicationContext<'_, Data, anyhow::Error>,
    #[description = "Channel to send simulation summaries"] channel: serenity::Channel,
) -> Result<()> {
    if let serenity::Channel::Guild(channel) = channel {
        let mut config = ctx.data().config.write().await;
        config.log_channel = Some(channel.id.get());
        drop(config); // Release the lock before saving
        ctx.data().save_config().await?;
        ctx.say(format!("Log channel set to {}", channel.name))
            .await?;
    } else {
        ctx.say("Please provide a valid guild text channel.")
            .await?;
    }
    Ok(())
}

async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, anyhow::Error>,
    _data: &Data,
) -> Result<()> {
    if let serenity::FullEvent::Ready { data_about_bot, .. } = event {
        info!("Logged in as {}", data_about_bot.user.name);
    }
    Ok(())
}

pub async fn start() -> Result<()> {
    dotenv().ok();
    let token = std::env::var("DISCORD_TOKEN").context("missing DISCORD_TOKEN")?;
    let intents = serenity::GatewayIntents::non_privileged();
    let config_path = config_path();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![simulate(), spin(), set_log_channel()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                let data = Data::new(config_path).await?;
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;
    Ok(())
}
