use chrono::Utc;
use order_bot::clients::{OrderClient, OrderRecord, OrderStore};
use order_bot::conversation::{
    Dispatcher, InboundEvent, Message, OrderWorkflow, WorkflowError, WorkflowSettings,
};
use order_bot::model::{
    CatalogEntry, OrderCreate, OrderFilter, OrderId, OrderSession, OrderUpdate, PricingCatalog,
    ServiceType, SessionId, SessionState,
};
use order_bot::order_actor::{OrderContext, OrderError};
use order_bot::response::ReplyKind;
use record_actor::mock::{create_mock_client, expect_query, expect_update, MockClient};
use record_actor::{FrameworkError, Sort, Stored};
use rust_decimal::Decimal;
use std::sync::Arc;

const USER: &str = "2348000000000";

fn record(id: u32, digits: u32) -> OrderRecord {
    let now = Utc::now();
    Stored {
        id: OrderId(id),
        created_at: now,
        updated_at: now,
        value: OrderSession::new(SessionId::from_digits(digits), USER),
    }
}

fn dispatcher(client: OrderClient) -> Dispatcher<OrderClient> {
    Dispatcher::new(OrderWorkflow::new(
        client,
        Arc::new(PricingCatalog::laundry()),
        WorkflowSettings::default(),
    ))
}

fn dispatcher_for(mock: &MockClient<OrderSession>) -> Dispatcher<OrderClient> {
    dispatcher(OrderClient::new(mock.client()))
}

/// Store failures are not answered in the conversation; they reach the caller.
#[tokio::test]
async fn test_store_failure_propagates() {
    let mut mock = MockClient::<OrderSession>::new();
    // Pending-pickup lookup, then the listing itself.
    mock.expect_query().return_ok(vec![]);
    mock.expect_query().return_err(FrameworkError::ActorClosed);

    let dispatcher = dispatcher_for(&mock);
    let result = dispatcher
        .dispatch(&InboundEvent::text(USER, "/orders"), "Ada")
        .await;

    assert!(matches!(
        result,
        Err(WorkflowError::Store(OrderError::ActorCommunicationError(_)))
    ));
    mock.verify();
}

fn pickup_reply(session: &str) -> InboundEvent {
    InboundEvent::new(
        USER,
        Message::ButtonReply {
            id: format!("p-*-{session}"),
            title: "Pickup Service".into(),
        },
    )
}

/// The session switched service between the read and the write.
#[tokio::test]
async fn test_rejected_update_keeps_entity_error() {
    let mut mock = MockClient::<OrderSession>::new();
    mock.expect_query().return_ok(vec![record(1, 482913)]);
    mock.expect_update()
        .return_err(FrameworkError::EntityError(Box::new(
            OrderError::ValidationError("session ord-482913 is already a dropoff order".into()),
        )));

    let dispatcher = dispatcher_for(&mock);
    let result = dispatcher.dispatch(&pickup_reply("ord-482913"), "Ada").await;

    match result {
        Err(WorkflowError::Store(OrderError::ValidationError(msg))) => {
            assert!(msg.contains("already a dropoff order"))
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    mock.verify();
}

/// A session already on another service is answered without writing.
#[tokio::test]
async fn test_pickup_on_dropoff_session_is_not_written() {
    let mut mock = MockClient::<OrderSession>::new();
    let mut dropoff = record(1, 482913);
    dropoff.value.service_type = Some(ServiceType::Dropoff);
    mock.expect_query().return_ok(vec![dropoff]);

    let dispatcher = dispatcher_for(&mock);
    let handled = dispatcher
        .dispatch(&pickup_reply("ord-482913"), "Ada")
        .await
        .unwrap();

    assert_eq!(
        handled.reply.body_text(),
        "Order ord-482913 is already set up for dropoff."
    );
    mock.verify();
}

/// A second `/order end` that loses the race to the first gets the no-active reply.
#[tokio::test]
async fn test_end_racing_another_end() {
    let mut mock = MockClient::<OrderSession>::new();
    mock.expect_query().return_ok(vec![]);
    mock.expect_query().return_ok(vec![record(1, 482913)]);
    mock.expect_update()
        .return_err(FrameworkError::EntityError(Box::new(
            OrderError::SessionEnded("ord-482913".into()),
        )));

    let dispatcher = dispatcher_for(&mock);
    let handled = dispatcher
        .dispatch(&InboundEvent::text(USER, "/order end"), "Ada")
        .await
        .unwrap();

    assert_eq!(handled.reply.body_text(), "No active order found.");
    assert_eq!(handled.reply.kind(), ReplyKind::Text);
    mock.verify();
}

#[tokio::test]
async fn test_cancel_racing_another_cancel() {
    let mut mock = MockClient::<OrderSession>::new();
    mock.expect_query().return_ok(vec![]);
    mock.expect_query().return_ok(vec![record(7, 100200)]);
    mock.expect_delete()
        .return_err(FrameworkError::NotFound("order_7".into()));

    let dispatcher = dispatcher_for(&mock);
    let handled = dispatcher
        .dispatch(&InboundEvent::text(USER, "/order cancel"), "Ada")
        .await
        .unwrap();

    assert_eq!(handled.reply.body_text(), "No active order found.");
    mock.verify();
}

#[tokio::test]
async fn test_missing_record_maps_to_not_found() {
    let mut mock = MockClient::<OrderSession>::new();
    mock.expect_update()
        .return_err(FrameworkError::NotFound("order_7".into()));

    let client = OrderClient::new(mock.client());
    let result = client.save(OrderId(7), OrderUpdate::End).await;

    assert_eq!(result.unwrap_err(), OrderError::NotFound("order_7".into()));
    mock.verify();
}

/// `/order` draws again when the store refuses an id it has issued before.
#[tokio::test]
async fn test_create_retries_issued_session_id() {
    let mut mock = MockClient::<OrderSession>::new();
    mock.expect_query().return_ok(vec![]);
    mock.expect_query().return_ok(vec![]);
    mock.expect_create()
        .return_err(FrameworkError::EntityError(Box::new(
            OrderError::DuplicateSessionId("ord-111111".into()),
        )));
    mock.expect_create().return_ok(record(1, 222222));

    let dispatcher = dispatcher_for(&mock);
    let handled = dispatcher
        .dispatch(&InboundEvent::text(USER, "/order"), "Ada")
        .await
        .unwrap();

    assert_eq!(handled.reply.button_ids(), vec!["p-*-ord-222222"]);
    mock.verify();
}

#[tokio::test]
async fn test_create_gives_up_after_repeated_collisions() {
    let mut mock = MockClient::<OrderSession>::new();
    mock.expect_query().return_ok(vec![]);
    mock.expect_query().return_ok(vec![]);
    for _ in 0..8 {
        mock.expect_create()
            .return_err(FrameworkError::EntityError(Box::new(
                OrderError::DuplicateSessionId("ord-111111".into()),
            )));
    }

    let dispatcher = dispatcher_for(&mock);
    let result = dispatcher
        .dispatch(&InboundEvent::text(USER, "/order"), "Ada")
        .await;

    assert!(matches!(result, Err(WorkflowError::SessionIdsExhausted(8))));
    mock.verify();
}

/// Inspects the queries the workflow sends for `/orders`.
#[tokio::test]
async fn test_listing_queries() {
    let (client, mut receiver) = create_mock_client::<OrderSession>(10);
    let dispatcher = dispatcher(OrderClient::new(client));

    let task = tokio::spawn(async move {
        dispatcher
            .dispatch(&InboundEvent::text(USER, "/orders"), "Ada")
            .await
    });

    let (pending, responder) = expect_query(&mut receiver).await.expect("pending lookup");
    assert_eq!(
        pending.filter,
        OrderFilter::user(USER).active().service(ServiceType::Pickup)
    );
    assert_eq!(pending.sort, Some(Sort::newest_created()));
    assert_eq!(pending.limit, Some(1));
    responder.send(Ok(vec![])).unwrap();

    let (listing, responder) = expect_query(&mut receiver).await.expect("listing");
    assert_eq!(listing.filter, OrderFilter::user(USER));
    assert_eq!(listing.sort, Some(Sort::newest_updated()));
    assert_eq!(listing.limit, Some(20));
    responder.send(Ok(vec![record(2, 222222), record(1, 111111)])).unwrap();

    let handled = task.await.unwrap().unwrap();
    assert_eq!(
        handled.reply.body_text(),
        "Here are your most recent 2 orders:\n- ord-222222 (active)\n- ord-111111 (active)\n"
    );
}

/// `/order end` resolves the newest active session and sends `End` for it.
#[tokio::test]
async fn test_end_sends_update_for_newest_active() {
    let (client, mut receiver) = create_mock_client::<OrderSession>(10);
    let dispatcher = dispatcher(OrderClient::new(client));

    let task = tokio::spawn(async move {
        dispatcher
            .dispatch(&InboundEvent::text(USER, "/order end"), "Ada")
            .await
    });

    let (_, responder) = expect_query(&mut receiver).await.expect("pending lookup");
    responder.send(Ok(vec![])).unwrap();

    let (latest, responder) = expect_query(&mut receiver).await.expect("latest active");
    assert_eq!(latest.filter, OrderFilter::user(USER).active());
    assert_eq!(latest.sort, Some(Sort::newest_created()));
    responder.send(Ok(vec![record(3, 333333)])).unwrap();

    let (id, update, responder) = expect_update(&mut receiver).await.expect("end update");
    assert_eq!(id, OrderId(3));
    assert!(matches!(update, OrderUpdate::End));
    let mut ended = record(3, 333333);
    ended.value.state = SessionState::Ended;
    responder.send(Ok(ended)).unwrap();

    let handled = task.await.unwrap().unwrap();
    assert_eq!(handled.reply.button_ids(), vec!["ord-333333"]);
}

/// Real actor: the catalog context guards tally writes.
#[tokio::test]
async fn test_actor_rejects_items_outside_catalog() {
    let catalog = Arc::new(
        PricingCatalog::new(vec![CatalogEntry::new("wash", Decimal::new(15000, 2))]).unwrap(),
    );
    let (actor, client) = order_bot::order_actor::new(8);
    let handle = tokio::spawn(actor.run(OrderContext::new(catalog.clone())));

    let order = client
        .create(OrderCreate {
            session_id: SessionId::from_digits(555555),
            user: USER.into(),
        })
        .await
        .unwrap();

    let wash = catalog.item("1").unwrap().name.clone();
    let updated = client
        .save(
            order.id,
            OrderUpdate::SetItem {
                name: wash,
                count: "2".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.value.tally.get("wash"), Some("2"));
    assert!(updated.updated_at >= order.updated_at);

    let laundry = PricingCatalog::laundry();
    let shirt = laundry.item("5").unwrap().name.clone();
    let rejected = client
        .save(
            order.id,
            OrderUpdate::SetItem {
                name: shirt,
                count: "1".into(),
            },
        )
        .await;
    assert_eq!(rejected.unwrap_err(), OrderError::UnknownItem("Shirt".into()));

    let malformed = client
        .create(OrderCreate {
            session_id: SessionId::parse("ord-x").unwrap(),
            user: USER.into(),
        })
        .await;
    assert!(matches!(malformed, Err(OrderError::ValidationError(_))));

    client.delete(order.id).await.unwrap();
    assert!(matches!(
        client.delete(order.id).await,
        Err(OrderError::NotFound(_))
    ));

    // A deleted session's id stays retired.
    let reused = client
        .create(OrderCreate {
            session_id: SessionId::from_digits(555555),
            user: "2348111111111".into(),
        })
        .await;
    assert_eq!(
        reused.unwrap_err(),
        OrderError::DuplicateSessionId("ord-555555".into())
    );

    drop(client);
    handle.await.unwrap();
}
