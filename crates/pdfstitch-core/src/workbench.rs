//! One pipeline's session state
//!
//! Ties a selection list and a status slot to a pipeline kind. A run is split
//! into three steps so hosts that cannot hold a borrow across an await (the
//! browser bindings keep the workbench in a `RefCell`) can release it while
//! the pipeline is suspended:
//!
//! 1. [`Workbench::begin_run`] checks inputs, marks the run, snapshots files
//! 2. [`pipeline::run`] is awaited on the snapshot
//! 3. [`Workbench::finish_run`] exports, clears the list and records status

use crate::config::PipelineConfig;
use crate::error::StitchError;
use crate::export::ExportSink;
use crate::pipeline::{self, ConversionResult, PipelineKind};
use crate::selection::SelectionList;
use crate::source::FileSource;
use crate::status::{OperationStatus, StatusReporter};

pub struct Workbench<F> {
    kind: PipelineKind,
    config: PipelineConfig,
    selection: SelectionList<F>,
    status: StatusReporter,
}

impl<F: FileSource + Clone> Workbench<F> {
    pub fn new(kind: PipelineKind) -> Self {
        Self::with_config(kind, PipelineConfig::default())
    }

    pub fn with_config(kind: PipelineKind, config: PipelineConfig) -> Self {
        Self {
            kind,
            config,
            selection: SelectionList::new(),
            status: StatusReporter::new(),
        }
    }

    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionList<F> {
        &self.selection
    }

    pub fn status(&self) -> &OperationStatus {
        self.status.current()
    }

    /// Append newly picked files; a new selection clears the last message
    ///
    /// Files picked during a run are kept but do not reset the running
    /// status. A successful run clears them along with the rest.
    pub fn add_files<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = F>,
    {
        self.selection.append(files);
        if !self.status.current().is_running() {
            self.status.reset();
        }
    }

    pub fn remove_file(&mut self, index: usize) -> Result<(), StitchError> {
        self.selection.remove_at(index).map(|_| ())
    }

    /// True when enough files are selected and nothing is running
    pub fn can_execute(&self) -> bool {
        !self.status.current().is_running()
            && self.kind.check_inputs(self.selection.len()).is_ok()
    }

    /// Start a run and hand back the files to process
    ///
    /// A second run while one is in flight is rejected with `Busy` and leaves
    /// the status alone. A precondition failure is recorded as the status
    /// and no file is touched.
    pub fn begin_run(&mut self) -> Result<Vec<F>, StitchError> {
        if self.status.current().is_running() {
            return Err(StitchError::Busy);
        }
        if let Err(e) = self.kind.check_inputs(self.selection.len()) {
            self.status.fail(e.to_string());
            return Err(e);
        }
        self.status.begin();
        Ok(self.selection.snapshot())
    }

    /// Record the outcome of a run started with `begin_run`
    pub fn finish_run<S: ExportSink>(
        &mut self,
        result: ConversionResult,
        sink: &mut S,
    ) -> ConversionResult {
        match result {
            Ok(document) => {
                sink.save(&document.bytes, &document.filename);
                self.selection.clear();
                self.status.succeed(self.kind.success_message());
                Ok(document)
            }
            Err(e) => {
                self.status.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Run the pipeline over the current selection
    pub async fn run<S: ExportSink>(&mut self, sink: &mut S) -> ConversionResult {
        let files = self.begin_run()?;
        let result = pipeline::run(self.kind, &files, &self.config).await;
        self.finish_run(result, sink)
    }
}
