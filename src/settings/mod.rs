pub mod ratatosk;
