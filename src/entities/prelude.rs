pub use super::auction_requests::Entity as AuctionRequests;
pub use super::auctions::Entity as Auctions;
pub use super::bid_history::Entity as BidHistory;
pub use super::payment_requests::Entity as PaymentRequests;
pub use super::users::Entity as Users;
pub use super::winners::Entity as Winners;
