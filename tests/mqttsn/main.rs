mod codec;
mod session;

#[cfg(feature = "std")]
mod host;
#[cfg(feature = "std")]
mod live;
