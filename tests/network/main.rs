mod http;
mod mock;
