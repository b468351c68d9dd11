use record_actor::{ActorEntity, FrameworkError, Query, ResourceActor, Sort};
use async_trait::async_trait;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Booking {
    guest: String,
    room: u32,
    checked_in: bool,
}

#[derive(Debug)]
struct BookingCreate {
    guest: String,
    room: u32,
}

#[derive(Debug)]
enum BookingUpdate {
    CheckIn,
    MoveTo(u32),
}

#[derive(Debug, Default)]
struct BookingFilter {
    guest: Option<String>,
    checked_in: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
enum BookingError {
    #[error("room {0} does not exist")]
    NoSuchRoom(u32),
}

/// Rooms that exist, injected as the actor's context.
struct Hotel {
    rooms: Vec<u32>,
}

#[async_trait]
impl ActorEntity for Booking {
    type Id = u32;
    type Create = BookingCreate;
    type Update = BookingUpdate;
    type Filter = BookingFilter;
    type Context = Hotel;
    type Error = BookingError;

    fn from_create_params(_id: u32, params: BookingCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            guest: params.guest,
            room: params.room,
            checked_in: false,
        })
    }

    fn matches(&self, filter: &BookingFilter) -> bool {
        filter.guest.as_ref().map_or(true, |g| *g == self.guest)
            && filter.checked_in.map_or(true, |c| c == self.checked_in)
    }

    async fn on_create(&mut self, hotel: &Hotel) -> Result<(), Self::Error> {
        if hotel.rooms.contains(&self.room) {
            Ok(())
        } else {
            Err(BookingError::NoSuchRoom(self.room))
        }
    }

    async fn on_update(&mut self, update: BookingUpdate, hotel: &Hotel) -> Result<(), Self::Error> {
        match update {
            BookingUpdate::CheckIn => self.checked_in = true,
            BookingUpdate::MoveTo(room) if hotel.rooms.contains(&room) => self.room = room,
            BookingUpdate::MoveTo(room) => return Err(BookingError::NoSuchRoom(room)),
        }
        Ok(())
    }
}

fn booking(guest: &str, room: u32) -> BookingCreate {
    BookingCreate {
        guest: guest.to_string(),
        room,
    }
}

// --- Test ---

#[tokio::test]
async fn test_record_store_full_lifecycle() {
    let (actor, client) = ResourceActor::<Booking>::new(10);
    let handle = tokio::spawn(actor.run(Hotel {
        rooms: vec![101, 102, 103],
    }));

    // 1. Create, with the context validating the payload
    let first = client.create(booking("ada", 101)).await.unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(first.created_at, first.updated_at);

    let rejected = client.create(booking("ada", 999)).await;
    assert!(matches!(rejected, Err(FrameworkError::EntityError(_))));

    let second = client.create(booking("ada", 102)).await.unwrap();
    assert_eq!(second.id, 2, "a rejected create must not consume an id");
    let third = client.create(booking("cy", 103)).await.unwrap();

    // 2. Update through the hook
    let moved = client.update(first.id, BookingUpdate::MoveTo(103)).await.unwrap();
    assert_eq!(moved.value.room, 103);
    assert_eq!(moved.created_at, first.created_at);

    let bad_move = client.update(first.id, BookingUpdate::MoveTo(7)).await;
    assert!(bad_move.is_err());
    let unchanged = client.get(first.id).await.unwrap().unwrap();
    assert_eq!(unchanged.value.room, 103);

    client.update(second.id, BookingUpdate::CheckIn).await.unwrap();

    // 3. Query: filter, sort, limit
    let ada = client
        .query(Query::new(BookingFilter {
            guest: Some("ada".into()),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(ada.len(), 2);
    assert_eq!(ada[0].id, first.id);

    let recently_touched = client
        .query(Query::new(BookingFilter::default()).sorted(Sort::newest_updated()))
        .await
        .unwrap();
    let order: Vec<u32> = recently_touched.iter().map(|r| r.id).collect();
    assert_eq!(order, vec![second.id, first.id, third.id]);

    let waiting = client
        .find_one(BookingFilter {
            checked_in: Some(false),
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(waiting.id, first.id);

    // 4. Delete
    client.delete(third.id).await.unwrap();
    assert!(client.get(third.id).await.unwrap().is_none());
    assert!(matches!(
        client.delete(third.id).await,
        Err(FrameworkError::NotFound(_))
    ));

    drop(client);
    handle.await.unwrap();
}
