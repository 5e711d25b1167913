pub mod ffmpeg_media_loader;
