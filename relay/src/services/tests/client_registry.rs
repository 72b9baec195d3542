//! Tests for the ClientRegistry service

use super::fixtures::*;
use super::helpers::*;
use crate::services::RealClientRegistry;
use crate::traits::ClientRegistry;

mod real_client_registry_tests {
    use super::*;

    #[tokio::test]
    async fn test_client_count_starts_at_zero() {
        let registry = RealClientRegistry::new();
        assert_eq!(registry.client_count().await, 0);
        assert!(registry.match_all(true).await.is_empty());
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        let registry = RealClientRegistry::new();
        let (tx, _rx) = create_client_channel();

        let id = registry.register(tx, true).await;
        assert_eq!(registry.client_count().await, 1);

        assert!(registry.unregister(id).await);
        assert!(!registry.unregister(id).await);
        assert_eq!(registry.client_count().await, 0);
    }

    #[tokio::test]
    async fn test_match_all_filters_uncontrolled() {
        let registry = RealClientRegistry::new();
        let (tx1, _rx1) = create_client_channel();
        let (tx2, _rx2) = create_client_channel();
        registry.register(tx1, true).await;
        registry.register(tx2, false).await;

        assert_eq!(registry.match_all(false).await.len(), 1);
        assert_eq!(registry.match_all(true).await.len(), 2);
    }

    #[tokio::test]
    async fn test_claim_controls_every_client() {
        let (registry, _clients) = create_registry_with_clients(3, false).await;

        assert_eq!(registry.claim().await, 3);
        assert_eq!(registry.claim().await, 0);
        assert_eq!(registry.match_all(false).await.len(), 3);
    }

    #[tokio::test]
    async fn test_closed_clients_are_not_matched() {
        let (registry, mut clients) = create_registry_with_clients(2, true).await;
        drop(clients.pop());

        assert_eq!(registry.client_count().await, 2);
        assert_eq!(registry.match_all(true).await.len(), 1);
    }

    #[tokio::test]
    async fn test_handles_deliver_to_their_client() {
        let (registry, mut clients) = create_registry_with_clients(1, true).await;
        let handle = registry.match_all(true).await.remove(0);
        assert_eq!(handle.id, clients[0].0);

        assert!(handle.post_message(create_test_update()));
        assert_eq!(clients[0].1.recv().await, Some(create_test_update()));
    }
}
