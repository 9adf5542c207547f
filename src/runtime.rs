// Background runtime for the orchestrators
// Spawns orchestrator futures on a tokio runtime and hands their events to the UI thread

use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use travel_scout_backend::config::ScoutConfig;
use travel_scout_backend::error::AppError;
use travel_scout_backend::orchestrator::plan_types::AspectRatio;
use travel_scout_backend::orchestrator::{
    run_briefing, run_hidden_spots, run_itinerary, run_video, EventSink, ScoutEvent,
    ServiceContext, VideoPhase,
};
use travel_scout_backend::services::FileService;
use travel_scout_backend::state::ScoutState;

/// Owns the tokio runtime, the service context and the event channel
pub struct ScoutRuntime {
    runtime: Runtime,
    ctx: ServiceContext,
    events: EventSink,
    rx: UnboundedReceiver<ScoutEvent>,
    video_cancel: Option<CancellationToken>,
}

impl ScoutRuntime {
    /// Build the runtime and a Gemini-backed context
    pub fn new(config: ScoutConfig) -> Result<Self, AppError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let ctx = ServiceContext::gemini(config)?;
        let (events, rx) = EventSink::channel();
        Ok(Self {
            runtime,
            ctx,
            events,
            rx,
            video_cancel: None,
        })
    }

    /// Start the itinerary orchestrator
    pub fn start_plan(&self, scout: &mut ScoutState, location: &str) {
        let generation = scout.begin_plan(location);
        let (ctx, events, location) = (self.ctx.clone(), self.events.clone(), location.to_string());
        self.runtime.spawn(async move {
            run_itinerary(&ctx, generation, &location, &events).await;
        });
    }

    /// Start the hidden spots orchestrator
    pub fn start_gems(&self, scout: &mut ScoutState, location: &str) {
        let generation = scout.begin_gems(location);
        let (ctx, events, location) = (self.ctx.clone(), self.events.clone(), location.to_string());
        self.runtime.spawn(async move {
            run_hidden_spots(&ctx, generation, &location, &events).await;
        });
    }

    /// Start the map-grounded briefing
    pub fn start_briefing(&self, scout: &mut ScoutState, location: &str) {
        let generation = scout.begin_briefing(location);
        let (ctx, events, location) = (self.ctx.clone(), self.events.clone(), location.to_string());
        self.runtime.spawn(async move {
            let _ = run_briefing(&ctx, generation, &location, &events).await;
        });
    }

    /// Start the video pipeline, cancelling any run still in flight
    pub fn start_video(&mut self, scout: &mut ScoutState, location: &str, aspect_ratio: AspectRatio) {
        self.cancel_video();
        let generation = scout.begin_video(location, aspect_ratio);
        let cancel = CancellationToken::new();
        self.video_cancel = Some(cancel.clone());

        let (ctx, events, location) = (self.ctx.clone(), self.events.clone(), location.to_string());
        self.runtime.spawn(async move {
            let _ = run_video(&ctx, generation, &location, aspect_ratio, &cancel, &events).await;
        });
    }

    /// Cancel the running video pipeline, if any
    pub fn cancel_video(&mut self) {
        if let Some(token) = self.video_cancel.take() {
            tracing::info!("Cancelling video job");
            token.cancel();
        }
    }

    /// Send a chat message on the current session
    /// Returns false when nothing was sent
    pub fn send_chat(&self, scout: &mut ScoutState, text: &str) -> bool {
        let Some(pending) = scout.begin_chat(text) else {
            return false;
        };
        let (ctx, events) = (self.ctx.clone(), self.events.clone());
        self.runtime.spawn(async move {
            let reply = pending.resolve(ctx.service.as_ref()).await;
            events.emit(ScoutEvent::ChatReply(reply));
        });
        true
    }

    /// Rebuild the service context with a different API key
    pub fn change_credential(&mut self, api_key: &str) -> Result<(), AppError> {
        self.ctx = self.ctx.with_credential(api_key)?;
        Ok(())
    }

    /// Export the current plan as plain text
    pub fn save_plan(&self, scout: &ScoutState) -> Result<String, AppError> {
        let (Some(plan), Some(location)) = (scout.plan.ready(), scout.plan_location.as_deref())
        else {
            return Err(AppError::InvalidInput("No travel plan to save".to_string()));
        };
        let path = self.runtime.block_on(FileService::save_plan(
            &self.ctx.config.export_dir,
            location,
            plan,
        ))?;
        Ok(path.display().to_string())
    }

    /// Copy the finished video into the export directory
    pub fn save_video(&self, scout: &ScoutState) -> Result<String, AppError> {
        let VideoPhase::Completed(video) = &scout.video.phase else {
            return Err(AppError::InvalidInput("No finished video to save".to_string()));
        };
        let path = self.runtime.block_on(FileService::save_video(
            &self.ctx.config.export_dir,
            &scout.video.location,
            video,
        ))?;
        Ok(path.display().to_string())
    }

    /// Apply every queued event without blocking
    /// Returns a log line for each event that was applied
    pub fn drain(&mut self, scout: &mut ScoutState) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            let line = describe(&event);
            if scout.apply(event) {
                if let Some(line) = line {
                    lines.push(line);
                }
            }
        }
        lines
    }
}

/// One log line per noteworthy event
pub fn describe(event: &ScoutEvent) -> Option<String> {
    match event {
        ScoutEvent::Plan {
            location, result, ..
        } => Some(match result {
            Ok(_) => format!("Travel plan ready for {}", location),
            Err(report) => format!("Travel plan failed: {}", report.message),
        }),
        ScoutEvent::PreviewImage { slot, status, .. } => status
            .image()
            .map(|_| format!("Preview {} ready", slot + 1))
            .or_else(|| Some(format!("Preview {} unavailable", slot + 1)))
            .filter(|_| !status.is_pending()),
        ScoutEvent::Gems { result, .. } => Some(match result {
            Ok(gems) => format!("{} hidden spots found", gems.len()),
            Err(report) => format!("Hidden spots failed: {}", report.message),
        }),
        ScoutEvent::GemImage { .. } => None,
        ScoutEvent::Briefing { result, .. } => Some(match result {
            Ok(brief) => format!("Briefing ready ({} map sources)", brief.sources.len()),
            Err(report) => format!("Briefing failed: {}", report.message),
        }),
        ScoutEvent::Video { phase, .. } => match phase {
            VideoPhase::Submitted { job } => Some(format!("Video job submitted: {}", job)),
            VideoPhase::Completed(video) => {
                Some(format!("Video ready: {} ({} bytes)", video.path.display(), video.size))
            }
            VideoPhase::Failed(report) => Some(format!("Video failed: {}", report.message)),
            _ => None,
        },
        ScoutEvent::ChatReply(reply) if reply.answer.is_none() => {
            Some("Chat request failed, showing fallback reply".to_string())
        }
        ScoutEvent::ChatReply(_) => None,
    }
}
