//! # Runtime Wiring
//!
//! The `upgrade-runtime` wiring against the mock node, both in-process and
//! through the real WebSocket adapter.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::timeout;

    use up_01_artifacts::ArgValue;
    use up_02_submission::{
        LocalSigner, SubmitOptions, Submitter, SubmitterConfig, TransactionApi, TxError,
        WsNodeConnection,
    };
    use up_03_deployment::{DeployRequest, Deployer};
    use up_04_proxy_workflow::{SequencingMode, DEFAULT_ENDOWMENT, DEFAULT_GAS_LIMIT};
    use upgrade_runtime::{RuntimeConfig, UpgradeRuntime};

    use crate::mock::fixtures::{self, REGISTRY_JSON};
    use crate::mock::{ws_bridge, OUTDATED};

    /// Artifacts and registry on disk, config pointing at them.
    fn on_disk(url: &str) -> (TempDir, RuntimeConfig) {
        let dir = TempDir::new().unwrap();
        fixtures::write_artifacts(&dir.path().join("ink")).unwrap();
        let registry = dir.path().join("registry.json");
        std::fs::write(&registry, REGISTRY_JSON).unwrap();

        let mut config = RuntimeConfig::default();
        config.node.url = url.to_string();
        config.node.request_timeout_secs = 5;
        config.node.registry_file = Some(registry);
        config.artifacts.root = dir.path().join("ink");
        (dir, config)
    }

    #[tokio::test]
    async fn test_runtime_over_websocket() {
        let node = fixtures::mock_node();
        let url = ws_bridge::serve(node.clone()).await;
        let (_dir, config) = on_disk(&url);

        let runtime = UpgradeRuntime::new(config).unwrap();
        let report = timeout(Duration::from_secs(20), runtime.run())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.average_before, Some(6));
        assert_eq!(report.average_after, Some(7));
        assert!(node.is_contract(&report.v1.address));
        assert!(node.is_contract(&report.v2.address));
        assert_eq!(node.values(&report.proxy.address), Some(vec![3, 7, 8]));
    }

    #[tokio::test]
    async fn test_runtime_pipelined_in_process() {
        let node = fixtures::mock_node();
        let (_dir, mut config) = on_disk("ws://127.0.0.1:9944");
        config.workflow.mode = SequencingMode::Pipelined;

        let runtime = UpgradeRuntime::new(config).unwrap();
        let report = runtime.run_with(node.clone()).await.unwrap();

        assert_eq!(report.average_after, Some(7));
        assert_eq!(node.executed_nonces(), (0..7).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_runtime_reports_missing_artifacts() {
        let node = fixtures::mock_node();
        let (dir, mut config) = on_disk("ws://127.0.0.1:9944");
        config.artifacts.root = dir.path().join("missing");

        let err = UpgradeRuntime::new(config)
            .unwrap()
            .run_with(node.clone())
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("artifact not found for `v1`"));
        assert!(node.executed_nonces().is_empty());
    }

    #[tokio::test]
    async fn test_websocket_module_error_and_stale_nonce() {
        let node = fixtures::mock_node();
        let url = ws_bridge::serve(node.clone()).await;
        let connection = Arc::new(
            WsNodeConnection::connect(&url, Duration::from_secs(5))
                .await
                .unwrap(),
        );
        let signer = LocalSigner::from_uri("//Alice", connection.clone()).unwrap();
        let submitter = Arc::new(Submitter::new(
            Arc::new(fixtures::registry()),
            SubmitterConfig::default(),
        ));

        let v1 = Deployer::new(submitter.clone())
            .deploy(
                Arc::new(fixtures::v1()),
                &signer,
                DeployRequest::new("new", DEFAULT_ENDOWMENT, DEFAULT_GAS_LIMIT),
            )
            .await
            .unwrap();
        assert!(node.is_contract(&v1.address));

        // v1 has no `upgrade` message, so the proxy's selector traps.
        let upgrade = fixtures::proxy()
            .encode_message("upgrade", &[ArgValue::Hash(v1.code_hash())])
            .unwrap();
        let call = up_02_submission::CallDescriptor::Call {
            dest: v1.address,
            data: upgrade,
            value: 0,
            gas_limit: DEFAULT_GAS_LIMIT,
        };
        let err = submitter
            .submit_and_await(&signer, call.clone(), SubmitOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Contracts.ContractTrapped: "));

        let stale = timeout(
            Duration::from_secs(5),
            submitter.submit_and_await(&signer, call, SubmitOptions::with_nonce(0)),
        )
        .await
        .unwrap();
        assert_eq!(
            stale,
            Err(TxError::SubmissionRejected {
                reason: OUTDATED.into()
            })
        );

        assert_eq!(submitter.stats().submitted, 2);
        assert_eq!(submitter.stats().rejected, 1);
    }
}
