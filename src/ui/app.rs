//! Main TUI application state and logic

use crate::buffer::{channel_observers, BufferEvent, InstrumentedBuffer};
use crate::config::Config;
use crate::driver::DataLayout;
use crate::errors::SortError;
use crate::sort::{Algorithm, Sorter};
use crate::ui::highlight::{Highlights, Pane};
use crate::ui::panes::{
    render_bars_pane, render_stats_pane, render_status_bar, BarsRenderData, RunIndicator,
    StatsRenderData, StatusRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Steps taken between event drains when running to the end
const RUN_BATCH: usize = 4096;

/// Most steps a single play tick may take
const MAX_STEPS_PER_TICK: u128 = 1000;

const MAX_INTERVAL_MS: u64 = 2000;

/// A sorter plus the receiving ends of its observer channels
struct Run {
    sorter: Box<dyn Sorter<u32>>,
    events: Receiver<BufferEvent<u32>>,
    scratch_events: Receiver<BufferEvent<u32>>,
}

impl Run {
    fn new(algorithm: Algorithm, values: Vec<u32>) -> Self {
        let (tx, events) = mpsc::channel();
        let mut buffer = InstrumentedBuffer::from(values);
        channel_observers(&mut buffer, tx);

        let mut sorter = algorithm.build(buffer);
        let (scratch_tx, scratch_events) = mpsc::channel();
        if let Some(scratch) = sorter.scratch_buffer_mut() {
            channel_observers(scratch, scratch_tx);
        }

        Run {
            sorter,
            events,
            scratch_events,
        }
    }
}

/// The main application state
pub struct App {
    pub config: Config,

    /// Algorithm currently on screen
    pub algorithm: Algorithm,

    pub layout: DataLayout,

    run: Run,

    /// Fading marks from recent buffer events
    pub highlights: Highlights,

    /// Successful `step()` calls in the current run
    pub steps: u64,

    pub max_stack_depth: usize,

    /// Delay between steps in play mode
    pub interval: Duration,

    /// The error that stopped the current run, if any
    pub failure: Option<SortError>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app showing the first configured algorithm
    pub fn new(config: Config) -> Self {
        let algorithm = config.algorithms.first().copied().unwrap_or(Algorithm::Quick);
        let layout = config.layout;
        let run = Run::new(algorithm, config.values());
        let interval = config.interval;
        App {
            config,
            algorithm,
            layout,
            run,
            highlights: Highlights::new(),
            steps: 0,
            max_stack_depth: 0,
            interval,
            failure: None,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    pub fn sorter(&self) -> &dyn Sorter<u32> {
        self.run.sorter.as_ref()
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing {
                self.tick();
            }
            self.highlights.expire(Instant::now());

            // Poll no longer than one frame or one step interval
            let timeout = self
                .interval
                .clamp(Duration::from_millis(1), Duration::from_millis(16));
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        self.run.sorter.cancel();
        Ok(())
    }

    /// Take as many steps as the elapsed play time allows
    fn tick(&mut self) {
        let elapsed = self.last_play_time.elapsed();
        if elapsed < self.interval {
            return;
        }
        let due = if self.interval.is_zero() {
            64
        } else {
            (elapsed.as_nanos() / self.interval.as_nanos()).clamp(1, MAX_STEPS_PER_TICK) as usize
        };
        self.step_n(due);
        self.last_play_time = Instant::now();

        if self.is_finished() {
            self.is_playing = false;
            if self.sorter().is_done() && self.config.algorithms.len() > 1 {
                self.advance_queue();
            }
        }
    }

    /// In multi-algorithm mode, move on to the next algorithm and keep playing
    fn advance_queue(&mut self) {
        let queue = &self.config.algorithms;
        let Some(pos) = queue.iter().position(|a| *a == self.algorithm) else {
            return;
        };
        if let Some(next) = queue.get(pos + 1).copied() {
            self.algorithm = next;
            self.restart();
            self.is_playing = true;
            self.status_message = format!("Playing {}", next);
        } else {
            self.status_message = "All algorithms finished".to_string();
        }
    }

    fn is_finished(&self) -> bool {
        let sorter = self.sorter();
        sorter.is_done() || sorter.is_cancelled() || self.failure.is_some()
    }

    /// Step up to `n` times, stopping early at completion or on error.
    /// Returns the number of steps taken.
    fn step_n(&mut self, n: usize) -> usize {
        let mut stepped = 0;
        for _ in 0..n {
            if self.is_finished() {
                break;
            }
            match self.run.sorter.step() {
                Ok(()) => {
                    stepped += 1;
                    self.steps += 1;
                    self.max_stack_depth = self.max_stack_depth.max(self.sorter().stack_depth());
                }
                Err(e) => {
                    error!(algorithm = self.algorithm.name(), error = %e, "step failed");
                    self.status_message = format!("Error: {}", e);
                    self.failure = Some(e);
                    self.is_playing = false;
                    break;
                }
            }
        }
        self.drain_events();
        stepped
    }

    fn drain_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.run.events.try_recv() {
            self.highlights.record(Pane::Primary, &event, now);
        }
        while let Ok(event) = self.run.scratch_events.try_recv() {
            self.highlights.record(Pane::Scratch, &event, now);
        }
    }

    /// Rebuild the current algorithm over fresh data
    fn restart(&mut self) {
        let values = self.layout.generate(self.config.size, self.config.seed);
        self.run.sorter.cancel();
        self.run = Run::new(self.algorithm, values);
        self.highlights.clear();
        self.steps = 0;
        self.max_stack_depth = 0;
        self.failure = None;
        self.is_playing = false;
        debug!(algorithm = self.algorithm.name(), layout = %self.layout, "run restarted");
    }

    fn indicator(&self) -> RunIndicator {
        let sorter = self.sorter();
        if self.failure.is_some() {
            RunIndicator::Failed
        } else if sorter.is_done() {
            RunIndicator::Done
        } else if sorter.is_cancelled() {
            RunIndicator::Cancelled
        } else if self.is_playing {
            RunIndicator::Playing
        } else if self.steps == 0 {
            RunIndicator::Ready
        } else {
            RunIndicator::Paused
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let now = Instant::now();

        // Bars and stats on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(32)])
            .split(main_chunks[0]);

        let sorter = self.sorter();
        let max_value = self.config.size.saturating_sub(1) as u32;

        let bar_rows = if sorter.uses_scratch_buffer() {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(columns[0])
        } else {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(100)])
                .split(columns[0])
        };

        render_bars_pane(
            frame,
            bar_rows[0],
            BarsRenderData {
                title: sorter.name(),
                slots: sorter.buffer().slots(),
                pane: Pane::Primary,
                highlights: &self.highlights,
                max_value,
                finished: sorter.is_done(),
                now,
            },
        );

        if let Some(scratch) = sorter.scratch_buffer() {
            render_bars_pane(
                frame,
                bar_rows[1],
                BarsRenderData {
                    title: "Scratch",
                    slots: scratch.slots(),
                    pane: Pane::Scratch,
                    highlights: &self.highlights,
                    max_value,
                    finished: false,
                    now,
                },
            );
        }

        let state = match self.indicator() {
            RunIndicator::Ready => "ready",
            RunIndicator::Playing => "playing",
            RunIndicator::Paused => "paused",
            RunIndicator::Done => "sorted",
            RunIndicator::Cancelled => "cancelled",
            RunIndicator::Failed => "failed",
        };
        render_stats_pane(
            frame,
            columns[1],
            StatsRenderData {
                algorithm: sorter.name(),
                layout: self.layout.key(),
                seed: self.config.seed,
                len: sorter.buffer().len(),
                steps: self.steps,
                primary: sorter.buffer().counts(),
                scratch: sorter.scratch_buffer().map(|s| s.counts()),
                stack_depth: sorter.stack_depth(),
                max_stack_depth: self.max_stack_depth,
                state,
            },
        );

        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                steps: self.steps,
                interval: self.interval,
                indicator: self.indicator(),
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = self.step_n(n);
                if self.failure.is_none() {
                    self.status_message = format!("Stepped forward {} step(s)", stepped);
                }
            }
            KeyCode::Right => {
                self.is_playing = false;
                if self.step_n(1) == 1 {
                    self.status_message = "Stepped forward".to_string();
                } else if self.failure.is_none() {
                    self.status_message = "Nothing left to do".to_string();
                }
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    if self.is_finished() {
                        self.status_message = "Run finished; press r to restart".to_string();
                    } else {
                        self.is_playing = !self.is_playing;
                        if self.is_playing {
                            self.last_play_time = Instant::now()
                                .checked_sub(self.interval)
                                .unwrap_or(Instant::now());
                            self.status_message = "Playing...".to_string();
                        } else {
                            self.status_message = "Paused".to_string();
                        }
                    }
                }
            }
            KeyCode::Enter => {
                // Run to the end of the sort
                self.is_playing = false;
                let before = self.steps;
                while self.step_n(RUN_BATCH) > 0 {}
                if self.failure.is_none() {
                    self.status_message =
                        format!("Ran to end ({} more steps)", self.steps - before);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.restart();
                self.status_message = "Restarted".to_string();
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.is_playing = false;
                self.run.sorter.cancel();
                self.status_message = "Cancelled".to_string();
            }
            KeyCode::Tab => {
                self.algorithm = self.algorithm.next();
                self.restart();
                self.status_message = format!("Switched to {}", self.algorithm);
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.layout = self.layout.next();
                self.restart();
                self.status_message = format!("Layout: {}", self.layout);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let ms = self.interval.as_millis() as u64 / 2;
                self.interval = Duration::from_millis(ms);
                self.status_message = format!("Interval {}ms", ms);
            }
            KeyCode::Char('-') => {
                let ms = (self.interval.as_millis() as u64).max(1) * 2;
                self.interval = Duration::from_millis(ms.min(MAX_INTERVAL_MS));
                self.status_message = format!("Interval {}ms", self.interval.as_millis());
            }
            _ => {}
        }
    }
}
