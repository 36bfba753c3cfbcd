// Dashboard session - Owns the window, generators and rendering sink for one mount
use crate::application::classifier::Classifier;
use crate::application::generator::{mock_history, SampleGenerator};
use crate::application::publisher::{IndicatorMode, Publisher};
use crate::application::render_sink::RenderSink;
use crate::domain::dashboard::DashboardSkeleton;
use crate::domain::reading::{Reading, Status};
use crate::domain::window::RollingWindow;
use crate::error::Result;
use crate::infrastructure::config::{DashboardSettings, HistorySeed};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub status: Status,
    pub published: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub published: u64,
    pub skipped: u64,
}

pub struct DashboardSession<S: RenderSink> {
    window: RollingWindow,
    generator: SampleGenerator,
    publisher: Publisher,
    sink: S,
    summary: SessionSummary,
}

impl<S: RenderSink> DashboardSession<S> {
    pub fn new(
        window: RollingWindow,
        generator: SampleGenerator,
        publisher: Publisher,
        sink: S,
    ) -> Self {
        Self {
            window,
            generator,
            publisher,
            sink,
            summary: SessionSummary::default(),
        }
    }

    pub fn from_settings(settings: &DashboardSettings, sink: S, now: DateTime<Utc>) -> Result<Self> {
        let window = match settings.history {
            HistorySeed::Zero => RollingWindow::new(settings.window_capacity, now)?,
            HistorySeed::Mock => {
                RollingWindow::with_history(settings.window_capacity, &mock_history(now), now)?
            }
        };

        // A walk over seeded history continues from its newest reading.
        let origin = match (settings.history, window.latest()) {
            (HistorySeed::Mock, Some(latest)) => *latest,
            _ => Reading::new(now, settings.origin_temperature, settings.origin_energy),
        };
        let generator = SampleGenerator::new(settings.generator, origin, settings.seed);

        let classifier = settings
            .warning_threshold
            .map(Classifier::with_threshold)
            .unwrap_or_default();
        let title = settings.title.clone();
        let publisher = match settings.indicators {
            IndicatorMode::Linked => Publisher::linked(title, settings.labels, classifier),
            IndicatorMode::Detached => {
                let second = SampleGenerator::new(
                    settings.generator,
                    origin,
                    settings.seed.map(|seed| seed.wrapping_add(1)),
                );
                Publisher::detached(title, settings.labels, classifier, second)
            }
        };

        Ok(Self::new(window, generator, publisher, sink))
    }

    pub fn skeleton(&self, tick_interval_ms: u64) -> DashboardSkeleton {
        self.publisher.skeleton(tick_interval_ms, self.window.capacity())
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Generate, append, classify and publish. The sink sees the window only
    /// after the append has completed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        self.summary.ticks += 1;

        let reading = self.generator.generate(now);
        self.window.append(reading);
        let frame = self.publisher.compose(&self.window, &reading, now);

        let published = match self.sink.acquire().and_then(|_| self.sink.redraw(&frame)) {
            Ok(()) => {
                self.summary.published += 1;
                true
            }
            Err(e) => {
                self.summary.skipped += 1;
                tracing::debug!(version = frame.version, "Skipping redraw: {}", e);
                false
            }
        };

        tracing::trace!(
            tick = self.summary.ticks,
            temperature = reading.temperature,
            energy = reading.energy,
            status = frame.status.label(),
            "Dashboard tick"
        );

        TickReport {
            tick: self.summary.ticks,
            status: frame.status,
            published,
        }
    }

    /// Release the rendering context.
    pub fn teardown(&mut self) {
        self.sink.dispose();
    }
}

/// Running timer for a mounted session. Unmounting cancels the timer,
/// joins it and disposes the session's sink.
pub struct SessionHandle<S: RenderSink + 'static> {
    cancel: CancellationToken,
    task: Option<JoinHandle<DashboardSession<S>>>,
}

impl<S: RenderSink + 'static> SessionHandle<S> {
    pub fn mount(session: DashboardSession<S>, period: Duration) -> Self {
        if session.publisher.mode() == IndicatorMode::Detached {
            tracing::warn!("Indicators are detached from the chart window and may diverge from it");
        }
        tracing::info!(
            capacity = session.window().capacity(),
            generator = ?session.generator.mode(),
            threshold = session.publisher.classifier().threshold(),
            period_ms = period.as_millis() as u64,
            "Mounting dashboard session"
        );

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_timer(session, period, cancel.clone()));

        Self {
            cancel,
            task: Some(task),
        }
    }

    /// Stop ticking and release the rendering context. Returns `None` when
    /// the session was already unmounted.
    pub async fn unmount(&mut self) -> Option<SessionSummary> {
        self.cancel.cancel();
        let task = self.task.take()?;

        match task.await {
            Ok(mut session) => {
                session.teardown();
                let summary = session.summary();
                tracing::info!(
                    ticks = summary.ticks,
                    published = summary.published,
                    skipped = summary.skipped,
                    "Dashboard session unmounted"
                );
                Some(summary)
            }
            Err(e) => {
                tracing::error!("Dashboard timer task failed: {}", e);
                None
            }
        }
    }

    /// Unmount once `signal` resolves. Meant as a server's graceful-shutdown
    /// future: the viewer stream has to end before connections can drain.
    pub async fn unmount_after<F>(mut self, signal: F)
    where
        F: Future<Output = ()> + Send,
    {
        signal.await;
        self.unmount().await;
    }
}

impl<S: RenderSink + 'static> Drop for SessionHandle<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_timer<S: RenderSink>(
    mut session: DashboardSession<S>,
    period: Duration,
    cancel: CancellationToken,
) -> DashboardSession<S> {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately; readings start one period after mount.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let report = session.tick(Utc::now());
                if report.status == Status::Warning {
                    tracing::debug!(tick = report.tick, published = report.published, "Warning status");
                }
            }
        }
    }

    session
}
