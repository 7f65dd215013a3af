//! Cancellation and ambient-context tests: cooperative cancellation through
//! the mediation context, task-local scope visibility and resolver-boundary
//! failure propagation.

mod common;

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use mediator_core::context::{self, MediationContext};
use mediator_core::error::{HandlerError, MediationError};
use mediator_core::handler::MainHandler;
use mediator_core::resolver::{HandlerResolver, HandlerTypeId, ResolveError};
use mediator_core::{Mediator, StaticHandlerResolver};

use common::{CreateUser, CreatedUser, GetUser, GetUserMain, Recorder};

/// Main handler that races its work against the dispatch cancellation
/// signal and stops cooperatively when the signal wins.
struct CancellableMain {
    recorder: Arc<Recorder>,
}

#[async_trait]
impl MainHandler<CreateUser> for CancellableMain {
    async fn handle(
        &self,
        _message: &CreateUser,
        ctx: &MediationContext,
    ) -> Result<CreatedUser, HandlerError> {
        tokio::select! {
            () = ctx.cancellation().cancelled() => Err(HandlerError::Cancelled),
            () = tokio::time::sleep(Duration::from_secs(5)) => {
                self.recorder.record("work");
                Ok(CreatedUser { id: 42 })
            }
        }
    }
}

#[tokio::test]
async fn test_pre_cancelled_dispatch_yields_cancellation_failure() {
    let recorder = Recorder::new();
    let mediator = Mediator::builder()
        .main_handler::<CreateUser, _>(Arc::new(CancellableMain {
            recorder: recorder.clone(),
        }))
        .build();

    let token = CancellationToken::new();
    token.cancel();

    let err = mediator
        .send_with_cancellation(
            CreateUser {
                name: "ada".to_string(),
            },
            token,
        )
        .await
        .unwrap_err();

    assert!(err.is_cancellation());
    assert!(matches!(err, MediationError::Cancelled { .. }));
    // The handler never reached its work.
    assert!(recorder.markers().is_empty());
}

#[tokio::test]
async fn test_mid_flight_cancellation_interrupts_the_handler() {
    let recorder = Recorder::new();
    let mediator = Mediator::builder()
        .main_handler::<CreateUser, _>(Arc::new(CancellableMain {
            recorder: recorder.clone(),
        }))
        .build();

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(2),
        mediator.send_with_cancellation(
            CreateUser {
                name: "ada".to_string(),
            },
            token,
        ),
    )
    .await
    .expect("cancellation must interrupt promptly")
    .unwrap_err();

    assert!(err.is_cancellation());
    assert!(recorder.markers().is_empty());
}

#[tokio::test]
async fn test_uncancelled_dispatch_completes_normally() {
    // A fresh token never fires; the select resolves through the work arm.
    struct QuickMain;

    #[async_trait]
    impl MainHandler<CreateUser> for QuickMain {
        async fn handle(
            &self,
            _message: &CreateUser,
            ctx: &MediationContext,
        ) -> Result<CreatedUser, HandlerError> {
            assert!(!ctx.is_cancelled());
            Ok(CreatedUser { id: 42 })
        }
    }

    let mediator = Mediator::builder()
        .main_handler::<CreateUser, _>(Arc::new(QuickMain))
        .build();

    let created = mediator
        .send(CreateUser {
            name: "ada".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 42);
}

#[tokio::test]
async fn test_ambient_context_matches_the_explicit_one() {
    /// Captures both views of the context for comparison after dispatch.
    struct ContextProbe {
        explicit_id: Mutex<Option<Uuid>>,
        ambient_id: Mutex<Option<Uuid>>,
    }

    #[async_trait]
    impl MainHandler<GetUser> for ContextProbe {
        async fn handle(
            &self,
            _message: &GetUser,
            ctx: &MediationContext,
        ) -> Result<String, HandlerError> {
            *self.explicit_id.lock() = Some(ctx.correlation_id());
            *self.ambient_id.lock() = context::try_current().map(|c| c.correlation_id());
            Ok(String::new())
        }
    }

    let probe = Arc::new(ContextProbe {
        explicit_id: Mutex::new(None),
        ambient_id: Mutex::new(None),
    });
    let mediator = Mediator::builder()
        .main_handler::<GetUser, _>(probe.clone())
        .build();

    assert!(!context::has_current());
    mediator.query(GetUser { id: 1 }).await.unwrap();
    // Scope ended with the dispatch; nothing leaks to the caller.
    assert!(!context::has_current());

    let explicit = probe.explicit_id.lock().unwrap();
    let ambient = probe.ambient_id.lock().expect("ambient context was active");
    assert_eq!(explicit, ambient);
}

#[tokio::test]
async fn test_concurrent_dispatches_get_distinct_contexts() {
    struct IdEcho;

    #[async_trait]
    impl MainHandler<GetUser> for IdEcho {
        async fn handle(
            &self,
            _message: &GetUser,
            ctx: &MediationContext,
        ) -> Result<String, HandlerError> {
            tokio::task::yield_now().await;
            Ok(ctx.correlation_id().to_string())
        }
    }

    let mediator = Mediator::builder()
        .main_handler::<GetUser, _>(Arc::new(IdEcho))
        .build();

    let (a, b) = tokio::join!(
        mediator.query(GetUser { id: 1 }),
        mediator.query(GetUser { id: 2 }),
    );
    assert_ne!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn test_missing_instance_surfaces_as_resolution_error() {
    // Registered type, no provided instance.
    let mediator = Mediator::builder().register_main::<GetUser, GetUserMain>().build();

    let err = mediator.query(GetUser { id: 1 }).await.unwrap_err();
    assert!(matches!(
        err,
        MediationError::Resolution(ResolveError::NotProvided { .. })
    ));
}

#[tokio::test]
async fn test_custom_resolver_failure_propagates_unwrapped() {
    struct BrokenResolver;

    impl HandlerResolver for BrokenResolver {
        fn resolve(
            &self,
            handler: &HandlerTypeId,
        ) -> Result<Arc<dyn Any + Send + Sync>, ResolveError> {
            Err(ResolveError::Failed {
                handler: handler.name(),
                reason: "container offline".to_string(),
            })
        }
    }

    let mediator = Mediator::builder()
        .with_resolver(Arc::new(BrokenResolver))
        .register_main::<GetUser, GetUserMain>()
        .build();

    let err = mediator.query(GetUser { id: 1 }).await.unwrap_err();
    match err {
        MediationError::Resolution(ResolveError::Failed { reason, .. }) => {
            assert_eq!(reason, "container offline");
        }
        other => panic!("expected resolution failure, got {other}"),
    }
}

#[tokio::test]
async fn test_resolver_returning_wrong_type_is_a_type_mismatch() {
    struct WrongTypeResolver;

    impl HandlerResolver for WrongTypeResolver {
        fn resolve(
            &self,
            _handler: &HandlerTypeId,
        ) -> Result<Arc<dyn Any + Send + Sync>, ResolveError> {
            Ok(Arc::new(42u32))
        }
    }

    let mediator = Mediator::builder()
        .with_resolver(Arc::new(WrongTypeResolver))
        .register_main::<GetUser, GetUserMain>()
        .build();

    let err = mediator.query(GetUser { id: 1 }).await.unwrap_err();
    assert!(matches!(err, MediationError::HandlerTypeMismatch { .. }));
}

#[tokio::test]
async fn test_custom_resolver_with_provided_instances() {
    // A host resolver wrapping the static one sees every resolution request.
    struct CountingResolver {
        inner: StaticHandlerResolver,
        resolutions: Mutex<u32>,
    }

    impl HandlerResolver for CountingResolver {
        fn resolve(
            &self,
            handler: &HandlerTypeId,
        ) -> Result<Arc<dyn Any + Send + Sync>, ResolveError> {
            *self.resolutions.lock() += 1;
            self.inner.resolve(handler)
        }
    }

    let inner = StaticHandlerResolver::new();
    inner.provide(Arc::new(GetUserMain));
    let counting = Arc::new(CountingResolver {
        inner,
        resolutions: Mutex::new(0),
    });

    let mediator = Mediator::builder()
        .with_resolver(counting.clone())
        .register_main::<GetUser, GetUserMain>()
        .build();

    mediator.query(GetUser { id: 1 }).await.unwrap();
    mediator.query(GetUser { id: 2 }).await.unwrap();

    // One resolution per registered handler per dispatch.
    assert_eq!(*counting.resolutions.lock(), 2);
}
