use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};

use crate::domain::cluster::node_info::NodeInfos;
use crate::domain::communication::protocol::{BestOptionRequest, BestOptionsRequest};
use crate::domain::expander::expansion_option::ExpansionOption;
use crate::domain::expander::remote::channel::Channel;
use crate::domain::expander::remote::client::{ExpanderClient, RpcExpanderClient, with_deadline};
use crate::domain::expander::remote::config::ExpanderConfig;
use crate::domain::expander::remote::marshal;
use crate::domain::expander::strategy_trait::{Filter, Strategy};
use crate::error::{ConstructionError, RemoteCallError};

const RUNTIME_WORKER_THREADS: usize = 2;

/// Strategy that asks a remote expander for the best option and falls back to
/// a local strategy whenever no usable answer arrives within the call timeout.
///
/// Calls block the calling thread for at most the call timeout. The exchange
/// itself runs on the strategy's own runtime, so any thread may call,
/// including tokio's blocking pool.
pub struct RemoteStrategy {
    client: Arc<dyn ExpanderClient>,
    fallback: Arc<dyn Strategy>,
    call_timeout: Duration,
    runtime: Option<Runtime>,
}

impl RemoteStrategy {
    /// Builds the channel described by `config`. Nothing is dialed yet.
    pub fn new(config: &ExpanderConfig, fallback: Arc<dyn Strategy>) -> Result<Self, ConstructionError> {
        let channel = Arc::new(Channel::new(config)?);
        Self::with_client(Arc::new(RpcExpanderClient::new(channel)), fallback, config.call_timeout)
    }

    pub fn with_client(client: Arc<dyn ExpanderClient>, fallback: Arc<dyn Strategy>, call_timeout: Duration) -> Result<Self, ConstructionError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(RUNTIME_WORKER_THREADS)
            .thread_name("remote-expander")
            .enable_all()
            .build()
            .map_err(ConstructionError::Runtime)?;

        Ok(Self { client, fallback, call_timeout, runtime: Some(runtime) })
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Remote path only: the option chosen by the remote expander, or why
    /// there is none.
    pub fn try_best_option<'a>(&self, options: &'a [ExpansionOption], node_infos: &NodeInfos) -> Result<&'a ExpansionOption, RemoteCallError> {
        let (wire_options, correlation) = marshal::options_to_wire(options)?;
        if correlation.is_empty() {
            return Err(RemoteCallError::EmptyOptions);
        }
        let request = BestOptionRequest { options: wire_options, node_map: marshal::node_infos_to_wire(node_infos) };
        log::debug!("Asking remote expander for the best of {} options.", correlation.len());

        let response = self.block_on(move |client| async move { client.best_option(request).await })?;
        let node_group_id = response.node_group_id.ok_or(RemoteCallError::NoOptionReturned)?;
        correlation.resolve(&node_group_id)
    }

    /// Remote path only: the options the remote expander kept, in the order it
    /// returned them. Unknown ids are dropped.
    pub fn try_best_options<'a>(&self, options: &'a [ExpansionOption], node_infos: &NodeInfos) -> Result<Vec<&'a ExpansionOption>, RemoteCallError> {
        let (wire_options, correlation) = marshal::options_to_wire(options)?;
        if correlation.is_empty() {
            return Err(RemoteCallError::EmptyOptions);
        }
        let request = BestOptionsRequest { options: wire_options, node_map: marshal::node_infos_to_wire(node_infos) };
        log::debug!("Asking remote expander to filter {} options.", correlation.len());

        let response = self.block_on(move |client| async move { client.best_options(request).await })?;

        let mut kept: Vec<&'a ExpansionOption> = Vec::with_capacity(response.node_group_ids.len());
        for node_group_id in &response.node_group_ids {
            match correlation.resolve(node_group_id) {
                Ok(option) if kept.iter().any(|k| std::ptr::eq(*k, option)) => {}
                Ok(option) => kept.push(option),
                Err(err) => log::error!("Ignoring answer of remote expander: {}", err),
            }
        }

        if kept.is_empty() {
            return Err(RemoteCallError::NoOptionReturned);
        }
        Ok(kept)
    }

    /// Runs `call` on the strategy's runtime under the call timeout and waits
    /// for its result on the current thread.
    fn block_on<T, C, F>(&self, call: C) -> Result<T, RemoteCallError>
    where
        C: FnOnce(Arc<dyn ExpanderClient>) -> F,
        F: Future<Output = Result<T, RemoteCallError>> + Send + 'static,
        T: Send + 'static,
    {
        let runtime = self.runtime.as_ref().ok_or(RemoteCallError::ShutDown)?;
        let task = runtime.spawn(with_deadline(self.call_timeout, call(self.client.clone())));
        futures::executor::block_on(task)?
    }
}

impl Strategy for RemoteStrategy {
    fn best_option<'a>(&self, options: &'a [ExpansionOption], node_infos: &NodeInfos) -> Option<&'a ExpansionOption> {
        match self.try_best_option(options, node_infos) {
            Ok(option) => {
                log::debug!("Remote expander chose node group {}.", option.node_group);
                Some(option)
            }
            Err(err) => {
                report_failure(&err, "using fallback strategy");
                self.fallback.best_option(options, node_infos)
            }
        }
    }
}

impl Filter for RemoteStrategy {
    fn best_options<'a>(&self, options: &'a [ExpansionOption], node_infos: &NodeInfos) -> Vec<&'a ExpansionOption> {
        match self.try_best_options(options, node_infos) {
            Ok(kept) => kept,
            Err(err) => {
                report_failure(&err, "no options filtered");
                options.iter().collect()
            }
        }
    }
}

impl Drop for RemoteStrategy {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

fn report_failure(err: &RemoteCallError, consequence: &str) {
    match err {
        RemoteCallError::DuplicateNodeGroup(_) | RemoteCallError::NodeCountOverflow { .. } => {
            log::error!("Invalid expansion options for remote expander: {}; {}.", err, consequence)
        }
        _ => log::warn!("Remote expander call failed: {}; {}.", err, consequence),
    }
}

/// Remote strategy for `config`, or `fallback` alone when the channel cannot
/// be built.
pub fn remote_or_fallback(config: &ExpanderConfig, fallback: Arc<dyn Strategy>) -> Arc<dyn Strategy> {
    match RemoteStrategy::new(config, fallback.clone()) {
        Ok(strategy) => Arc::new(strategy),
        Err(err) => {
            log::error!("Remote expander unavailable ({}), running fallback strategy only.", err);
            fallback
        }
    }
}
